//! Authentication support (password hashing only -- the backend has no
//! sessions or tokens).

pub mod password;
