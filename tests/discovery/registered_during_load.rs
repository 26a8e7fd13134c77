use mod_link::{ LoadOutcome, LoadStatus };
use crate::fixture_loading::Harness ;

#[test]
fn discovery_registered_during_load_with_dynamic_dependency() {

	// Loading "LoadsUnknown" imports "Unknown", which registers itself along with a new
	// dependency and expects both to load.
	let mut harness = Harness::new();
	let unknown = harness.fixture();
	let dynamic = harness.fixture();
	let loads_unknown = harness.fixture().with_action( move | loader | {
		loader.register( "Unknown", unknown, [ "NewDynamicDependency" ]);
		loader.register( "NewDynamicDependency", dynamic, Vec::<String>::new() );
		let ( outcome, warnings ) = loader.request_load( "Unknown" ).unwrap();
		assert_no_warnings!( warnings );
		assert_eq!( outcome, LoadOutcome::Loaded );
		Ok(())
	});
	harness.loader.register( "LoadsUnknown", loads_unknown, Vec::<String>::new() );
	libraries!( harness, { "Test" => [ "LoadsUnknown" ] });

	let ( _, warnings ) = harness.loader.request_load( "Test" ).unwrap();
	assert_no_warnings!( warnings );

	assert_eq!( harness.invoked(), vec![ "LoadsUnknown", "NewDynamicDependency", "Unknown", "Test" ]);
	assert_eq!( harness.loader.loaded_libraries(), &[ "NewDynamicDependency", "Unknown", "LoadsUnknown", "Test" ].map( String::from ));
	assert_eq!( harness.loader.status_of( "Unknown" ), LoadStatus::Loaded );

}

#[test]
fn discovery_registered_during_load_lazy_dependency_lookup() {

	// "app" names "plugin" before anything registers it; loading "host" registers it.
	let mut harness = Harness::new();
	let plugin = harness.fixture();
	let host = harness.fixture().with_action( move | loader | {
		loader.register( "plugin", plugin, Vec::<String>::new() );
		Ok(())
	});
	harness.loader.register( "host", host, Vec::<String>::new() );
	libraries!( harness, { "app" => [ "host", "plugin" ] });

	let ( outcome, warnings ) = harness.loader.request_load( "app" ).unwrap();
	assert_no_warnings!( warnings );

	assert_eq!( outcome, LoadOutcome::Loaded );
	assert_eq!( harness.invoked(), vec![ "host", "plugin", "app" ]);

}
