mod optimizer;
mod scheduler;
