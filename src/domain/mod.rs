// Domain layer: RUT rules, the contact record and the port it is sent through.

pub mod contact;
pub mod model;
pub mod ports;
pub mod rut;
pub mod summary;
