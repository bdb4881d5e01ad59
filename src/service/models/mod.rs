mod host;
mod host_remote;
mod remote;
mod tag;
mod tag_remote;

pub use host::{Host, NewHost};
pub use host_remote::{AttachedRemote, HostRemote};
pub use remote::{Module, NewRemote, Remote, RemoteCount};
pub use tag::{NewTag, Tag};
pub use tag_remote::TagRemote;
