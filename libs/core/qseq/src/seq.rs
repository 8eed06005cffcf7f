mod chunk;
mod collect;
mod combinators;
mod seq_impl;
mod split;

pub use seq_impl::Seq;
pub use split::Split;
