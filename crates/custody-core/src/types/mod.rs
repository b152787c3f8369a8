mod batch;
mod evidence;
mod hold;
mod reconcile;
mod session;

pub use batch::*;
pub use evidence::*;
pub use hold::*;
pub use reconcile::*;
pub use session::*;
