// 服务层模块
//
// - runtime: Java 运行时检测、选择与下载
// - update: 应用自身更新
// - notification: 用户通知出口

pub mod notification;
pub mod runtime;
pub mod update;

pub use notification::{Notifier, TracingNotifier};
pub use runtime::*;
pub use update::*;
