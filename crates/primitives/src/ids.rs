use std::fmt;

macro_rules! define_id {
	($(#[$meta:meta])* $name:ident, $prefix:literal) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
		pub struct $name(pub u64);

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, concat!($prefix, "#{}"), self.0)
			}
		}
	};
}

define_id!(
	/// Identifies one editor view onto a document.
	EditorId,
	"editor"
);
define_id!(
	/// Identifies a text document.
	DocumentId,
	"doc"
);
define_id!(
	/// Handle for a registered change listener; releasing it unsubscribes.
	SubscriptionId,
	"sub"
);
