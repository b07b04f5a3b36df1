mod batch;
mod common;
mod evaluation;
