// Interface adapters: wire protocol, stdio streams and the wall clock.

pub mod clock;
pub mod protocol;
pub mod stdio;
