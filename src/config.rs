//! Loader configuration.

/// Environment variable that switches transition tracing on.
pub const TRACE_ENV_VAR: &str = "MOD_LINK_TRACE" ;

/// Options for a [`Loader`]( crate::Loader ).
///
/// ```
/// use mod_link::LoaderConfig ;
///
/// let config = LoaderConfig::default().with_trace_transitions( true );
/// assert!( config.trace_transitions() );
/// ```
#[derive( Debug, Clone, Copy, Default, PartialEq, Eq )]
pub struct LoaderConfig {
	/// Emit a [`Transition`]( crate::Transition ) for every state change
	trace_transitions: bool,
}

impl LoaderConfig {

	/// Reads the configuration from the process environment.
	///
	/// Tracing is enabled when [`TRACE_ENV_VAR`] is set to anything other than an
	/// empty string, `0`, or `false`.
	pub fn from_env() -> Self {
		Self::default().with_trace_transitions( std::env::var( TRACE_ENV_VAR ).is_ok_and(| value | flag_enabled( &value )))
	}

	/// Enables or disables transition tracing.
	pub fn with_trace_transitions( mut self, enabled: bool ) -> Self {
		self.trace_transitions = enabled ;
		self
	}

	/// Whether transitions are traced.
	#[inline] pub fn trace_transitions( &self ) -> bool { self.trace_transitions }

}

fn flag_enabled( value: &str ) -> bool {
	!matches!( value.trim().to_ascii_lowercase().as_str(), "" | "0" | "false" | "off" )
}

#[cfg( test )]
mod tests {
	use super::* ;

	#[test]
	fn flag_values() {
		assert!( flag_enabled( "1" ));
		assert!( flag_enabled( "TRUE" ));
		assert!( flag_enabled( "yes" ));
		assert!( !flag_enabled( "" ));
		assert!( !flag_enabled( " 0 " ));
		assert!( !flag_enabled( "False" ));
		assert!( !flag_enabled( "off" ));
	}

	#[test]
	fn tracing_is_off_by_default() {
		assert!( !LoaderConfig::default().trace_transitions() );
	}
}
