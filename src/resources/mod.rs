pub mod pod;

pub use pod::{KubePodStore, PodStore};
