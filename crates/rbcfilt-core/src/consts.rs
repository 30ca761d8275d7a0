/// Minimum pixel count (h*w) to run FFT lanes with Rayon.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Default fraction of the usable radius kept by the ideal low-pass filter.
pub const DEFAULT_LOW_PASS_RADIUS: f64 = 0.2;

/// Default number of contiguous bands in a band-pass sweep over [0, 1].
pub const DEFAULT_BAND_STEPS: usize = 10;

/// Default number of radius steps in a low-pass sweep over [0, 1] (0.05 apart).
pub const DEFAULT_RADIUS_STEPS: usize = 20;

/// Extensions recognised as frame files when scanning a directory.
pub const FRAME_EXTENSIONS: [&str; 2] = ["npy", "txt"];

/// Extension of persisted `FilteredFrame` records.
pub const RECORD_EXTENSION: &str = "bin";

/// Extension of coordinate export files read by the topology tool.
pub const COORDS_EXTENSION: &str = "cub";

/// Extension of the topology tool's report files.
pub const REPORT_EXTENSION: &str = "cbetti";

/// Decimal places kept when rendering a filter parameter into a file name.
pub const MODE_NAME_PRECISION: usize = 12;

/// Default executable for the cubical homology tool.
pub const DEFAULT_CHOMP_PROGRAM: &str = "chomp";

/// Attempts made for one external tool invocation (first run plus one retry).
pub const DEFAULT_EXTERNAL_TOOL_ATTEMPTS: u32 = 2;

/// Magic prefix of a NumPy `.npy` file.
pub const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Header alignment used when writing `.npy` files.
pub const NPY_HEADER_ALIGNMENT: usize = 64;
