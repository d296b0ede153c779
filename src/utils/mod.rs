pub(crate) mod async_task;
pub mod file_io;
pub mod time;

#[cfg(test)]
mod async_task_test;
#[cfg(test)]
mod time_test;
