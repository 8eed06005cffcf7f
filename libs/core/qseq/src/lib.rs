pub mod cursor;
pub mod op;

mod error;
mod seq;

pub use cursor::{Advance, BoxedCursor, Cursor, Step};
pub use error::Error;
pub use op::{Cond, Fun, StatefulCond, StatefulFun};
pub use seq::{Seq, Split};
