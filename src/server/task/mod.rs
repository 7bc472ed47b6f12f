//! Background work started by request handlers, running detached from the request.

pub mod territory;
