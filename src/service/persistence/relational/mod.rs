mod association;
mod host;
mod remote;
mod tag;

pub use association::AssociationRelationalPersistence;
pub use host::HostRelationalPersistence;
pub use remote::RemoteRelationalPersistence;
pub use tag::TagRelationalPersistence;
