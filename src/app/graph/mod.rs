mod interaction;
mod pick;
mod view;

pub(in crate::app) use pick::PickBuffer;
