//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<StudentRecord>)
//!     ↓
//! workflow::StudentFlow (处理单名学生)
//!     ↓
//! services (能力层：randomizer / assembler / compiler / merger)
//!     ↓
//! models (名单、模板、参数)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，StudentFlow 管单个
//! 2. **向下依赖**：编排层 → workflow → services → models
//! 3. **无业务逻辑**：只做调度和统计，不做具体的拆分、替换、编译

pub mod batch_processor;

pub use batch_processor::{App, RunReport};
