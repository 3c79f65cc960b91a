// Application layer - Run orchestration and the ports it drives
pub mod record_sink;
pub mod sequence_scheduler;
pub mod shutdown;
pub mod simulated_clock;
