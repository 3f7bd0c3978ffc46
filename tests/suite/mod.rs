mod cli;
mod programs;
mod scoped_store;
