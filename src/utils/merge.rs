/// Chainable accumulation for the error lists threaded through loading.
pub(crate) trait Merge<T> {
	fn merge_all( self, items: impl IntoIterator<Item = T> ) -> Self ;
}

impl<T> Merge<T> for Vec<T> {
	#[inline] fn merge_all( mut self, items: impl IntoIterator<Item = T> ) -> Self {
		self.extend( items );
		self
	}
}

#[cfg( test )]
mod tests {
	use super::Merge ;

	#[test]
	fn merge_preserves_order() {
		let merged = vec![ 1, 2 ].merge_all([ 3, 4 ]).merge_all( None ).merge_all( Some( 5 ));
		assert_eq!( merged, vec![ 1, 2, 3, 4, 5 ]);
	}
}
