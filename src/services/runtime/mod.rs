// Java 运行时解析模块
//
// - backend: 原生后端接口
// - command: 命令边界适配（命令名 + JSON）
// - selection: 兼容性选择算法
// - resolver: 扫描/校验/查询/下载的编排

pub mod backend;
pub mod command;
pub mod resolver;
pub mod selection;

pub use backend::RuntimeBackend;
pub use command::{CommandInvoker, InvokeBackend};
pub use resolver::{RuntimeResolver, ScanOutcome};
pub use selection::{
    select_best, CompatibilityPolicy, ExactOnly, ForwardCompatible, RuntimeSelector,
};
