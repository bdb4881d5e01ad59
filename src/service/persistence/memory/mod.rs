mod association;
mod generic;
mod host;
mod remote;

pub use association::AssociationMemoryPersistence;
pub use generic::MemoryPersistence;
pub use host::HostMemoryPersistence;
pub use remote::RemoteMemoryPersistence;
