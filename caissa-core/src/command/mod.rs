//! Compilation of waypoint paths into controller commands

pub mod compiler;

pub use caissa_protocol::MotionCommand;
pub use compiler::{
    compile, compile_plan, CompileError, MagnetPolicy, MAX_PATH_COMMANDS, MAX_PLAN_COMMANDS,
};
