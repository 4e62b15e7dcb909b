//! Registry trait for self-registering implementations.
//!
//! Implementation modules (the remote authority client today) provide a
//! Registry struct implementing this trait, declaring the configuration
//! name the implementation answers to and the factory that builds it.

/// Base trait for implementation registries.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	///
	/// This should match the key used in the TOML configuration, for example
	/// "http" for remote.implementations.http or "mock" for
	/// remote.implementations.mock.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
