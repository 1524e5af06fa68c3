mod elements;
mod local_assembly;
mod postprocess;
mod registry;
