mod common;
mod fertilizer;
