//! Browsing state machines. Nothing here performs I/O: components queue requests in an
//! [`Outbox`] and are fed [`Completion`]s by whoever executes them.

mod controller;
mod edit_surface;
mod history;
mod navigator;
mod notice;
mod tasks;
mod version_panel;

pub use self::controller::{BrowserController, BrowserEvent, FileBody, FileView, View};
pub use self::edit_surface::{
    CursorMove, DirtyChanged, Edit, EditSurface, LOADING_PLACEHOLDER, SurfaceError, SurfaceState,
};
pub use self::history::{History, MemoryHistory, PopState};
pub use self::navigator::{Crumb, crumb_target, crumbs};
pub use self::notice::{Notice, NoticeLevel, Notices};
pub use self::tasks::{
    CancelFlag, Completion, Dispatch, Failure, FailureKind, Outbox, Request, Response, TaskHandle,
    TaskId,
};
pub use self::version_panel::{PanelError, PanelUpdate, VersionPanel, VersionRow};
