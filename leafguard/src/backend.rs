//! Backend selection for the Burn model.
//!
//! Inference runs on the CPU ndarray backend by default; the `cuda` feature
//! switches to GPU execution for deployments with NVIDIA hardware.

#[cfg(feature = "cuda")]
pub type DefaultBackend = burn::backend::Cuda;

#[cfg(all(feature = "ndarray", not(feature = "cuda")))]
pub type DefaultBackend = burn::backend::NdArray;

#[cfg(not(any(feature = "ndarray", feature = "cuda")))]
compile_error!("Either the 'ndarray' or 'cuda' feature must be enabled.");

/// Get the default device for the selected backend
pub fn default_device() -> <DefaultBackend as burn::tensor::backend::Backend>::Device {
    Default::default()
}

/// Human-readable name for the selected backend
pub fn backend_name() -> &'static str {
    #[cfg(feature = "cuda")]
    {
        "CUDA (GPU)"
    }
    #[cfg(all(feature = "ndarray", not(feature = "cuda")))]
    {
        "ndarray (CPU)"
    }
}
