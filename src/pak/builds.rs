use std::path::Path;

/// Per-build table geometry.
///
/// All pointer slots in the image hold virtual addresses; subtracting the
/// matching section delta turns one into a seekable file offset. The root
/// listing sits at a fixed offset in each supported image and ends at a
/// pre-known terminal offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTable {
    /// Absolute file offset of the first root-array slot
    pub root_offset: u64,
    /// Absolute file offset that marks "no more root entries"
    pub terminal_offset: u64,
    /// Subtracted from root-array pointers (.data section rebase)
    pub data_delta: i64,
    /// Subtracted from string-array pointers (.rdata section rebase)
    pub rdata_delta: i64,
}

const DR1_US_OFFSETS: OffsetTable = OffsetTable {
    root_offset: 0x28_AAB8,
    terminal_offset: 0x28_B8D8,
    data_delta: 0x40_1C00,
    rdata_delta: 0x40_1200,
};

const DR2_US_OFFSETS: OffsetTable = OffsetTable {
    root_offset: 0x2F_DB78,
    terminal_offset: 0x2F_E9A0,
    data_delta: 0x40_1C00,
    rdata_delta: 0x40_1600,
};

/// End-of-table markers, one per build. The same 4-byte pattern terminates
/// both the root array and each entry's string-pointer array.
const DR1_US_SENTINEL: [u8; 4] = [0xC0, 0x99, 0x65, 0x00];
const DR2_US_SENTINEL: [u8; 4] = [0xD0, 0x8D, 0x6C, 0x00];

/// The closed set of executables this tool knows how to read.
///
/// Each variant carries the table geometry, sentinel and output file name
/// for one shipped build. Anything else is unsupported; there is no
/// heuristic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Build {
    Dr1Us,
    Dr2Us,
}

impl Build {
    /// Identify the build from an image file name.
    ///
    /// Returns `None` for unrecognized names; the caller decides how to
    /// report that (the CLI prints a message and exits without output).
    pub fn detect(file_name: &str) -> Option<Self> {
        match file_name {
            "DR1_us.exe" => Some(Build::Dr1Us),
            "DR2_us.exe" => Some(Build::Dr2Us),
            _ => None,
        }
    }

    /// Identify the build from a full path or URL.
    ///
    /// Only the last path segment matters, matching how the images are
    /// shipped.
    pub fn detect_from_path(path: &str) -> Option<Self> {
        // URLs: strip query string, then take the last '/' segment
        let name = path.split(['?', '#']).next().unwrap_or(path);
        let name = name.rsplit('/').next().unwrap_or(name);
        let name = Path::new(name)
            .file_name()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        Self::detect(&name)
    }

    pub fn offsets(self) -> OffsetTable {
        match self {
            Build::Dr1Us => DR1_US_OFFSETS,
            Build::Dr2Us => DR2_US_OFFSETS,
        }
    }

    pub fn sentinel(self) -> [u8; 4] {
        match self {
            Build::Dr1Us => DR1_US_SENTINEL,
            Build::Dr2Us => DR2_US_SENTINEL,
        }
    }

    /// File name the mapping is persisted under for this build
    pub fn mapping_file_name(self) -> &'static str {
        match self {
            Build::Dr1Us => "dr1_us.mappings.json",
            Build::Dr2Us => "dr2_us.mappings.json",
        }
    }
}
