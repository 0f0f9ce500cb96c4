// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Depth value marking a pixel without a measurement
///
/// Also used for every coordinate of an invalid [`WorldPoint`] position.
///
/// [`WorldPoint`]: crate::pipelines::scene::WorldPoint
pub const MINF: f32 = f32::NEG_INFINITY;

/// Maximum edge length (meters) of an emitted triangle
///
/// Triangles with any edge at or above this length bridge a depth
/// discontinuity and are dropped.
pub const EDGE_THRESHOLD: f32 = 0.01;

/// Mesh output naming and format
pub mod mesh_output {
    /// Header tag of the colored OFF format
    pub const FORMAT_TAG: &str = "COFF";

    /// Number of vertices per emitted face
    pub const FACE_ARITY: u32 = 3;

    /// File name prefix, followed by the frame id
    pub const DEFAULT_BASE_NAME: &str = "mesh_";

    /// File extension without the leading dot
    pub const DEFAULT_EXTENSION: &str = "off";

    /// Suffix of the scratch file written before the final rename
    pub const TEMP_SUFFIX: &str = "tmp";
}

/// TUM RGB-D dataset layout and calibration
///
/// See <https://cvg.cit.tum.de/data/datasets/rgbd-dataset/file_formats>
pub mod tum {
    /// Depth image list (`timestamp filename` per line)
    pub const DEPTH_LIST: &str = "depth.txt";

    /// Color image list (`timestamp filename` per line)
    pub const COLOR_LIST: &str = "rgb.txt";

    /// Ground-truth trajectory (`timestamp tx ty tz qx qy qz qw` per line)
    pub const GROUNDTRUTH: &str = "groundtruth.txt";

    /// 16-bit depth PNG values per meter
    pub const DEPTH_SCALE: f32 = 5000.0;

    /// Focal length X (pixels) of the default calibration
    pub const FX: f32 = 525.0;
    /// Focal length Y (pixels) of the default calibration
    pub const FY: f32 = 525.0;
    /// Principal point X (pixels) of the default calibration
    pub const CX: f32 = 319.5;
    /// Principal point Y (pixels) of the default calibration
    pub const CY: f32 = 239.5;

    /// Frames advanced per call to the source
    pub const DEFAULT_FRAME_INCREMENT: usize = 10;
}

/// Config file location below the platform config directory
pub mod config_file {
    pub const APP_DIR: &str = "rgbd-mesh";
    pub const FILE_NAME: &str = "config.json";
}
