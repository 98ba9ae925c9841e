/// Number of coordinates per window used by the set operations unless told otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Storage settings for one archive handle.
///
/// The defaults favour write throughput over crash durability: archives are
/// rebuildable data products, so `synchronous` is switched off and the rollback
/// journal lives in memory. A failed batch still rolls back completely.
///
/// # Examples
///
/// ```
/// use mbtiles_core::ArchiveOptions;
///
/// let options = ArchiveOptions::builder()
///     .compact_on_close(false)
///     .batch_size(250)
///     .build();
/// assert!(!options.compact_on_close);
/// assert_eq!(options.batch_size, 250);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveOptions {
	/// Run `ANALYZE` and `VACUUM` when a writable archive is closed.
	pub compact_on_close: bool,
	/// `PRAGMA synchronous=OFF`.
	pub synchronous_off: bool,
	/// `PRAGMA journal_mode=MEMORY` instead of the on-disk `DELETE` journal.
	pub memory_journal: bool,
	/// `PRAGMA locking_mode=EXCLUSIVE`: one handle owns the file until it is closed.
	pub exclusive_locking: bool,
	/// Window size for batched enumeration in the set operations.
	pub batch_size: usize,
}

impl ArchiveOptions {
	pub fn builder() -> ArchiveOptionsBuilder {
		ArchiveOptionsBuilder::new()
	}
}

impl Default for ArchiveOptions {
	fn default() -> Self {
		ArchiveOptions {
			compact_on_close: true,
			synchronous_off: true,
			memory_journal: true,
			exclusive_locking: true,
			batch_size: DEFAULT_BATCH_SIZE,
		}
	}
}

/// Builder for [`ArchiveOptions`]; unset fields keep their defaults.
#[derive(Clone, Debug, Default)]
pub struct ArchiveOptionsBuilder {
	options: ArchiveOptions,
}

impl ArchiveOptionsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn compact_on_close(mut self, value: bool) -> Self {
		self.options.compact_on_close = value;
		self
	}

	pub fn synchronous_off(mut self, value: bool) -> Self {
		self.options.synchronous_off = value;
		self
	}

	pub fn memory_journal(mut self, value: bool) -> Self {
		self.options.memory_journal = value;
		self
	}

	pub fn exclusive_locking(mut self, value: bool) -> Self {
		self.options.exclusive_locking = value;
		self
	}

	pub fn batch_size(mut self, value: usize) -> Self {
		self.options.batch_size = value;
		self
	}

	pub fn build(self) -> ArchiveOptions {
		self.options
	}
}
