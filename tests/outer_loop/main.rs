
mod batch;
mod protocol;
mod resume;
mod run;
mod step;
