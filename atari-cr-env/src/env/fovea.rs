//! Frame preprocessing and the fovea.
use crate::SensoryActionMode;
use anyhow::{Context, Result};
use image::{
    imageops::{grayscale, resize, FilterType::Triangle},
    ImageBuffer, Luma, Rgb,
};

/// Converts an RGB screen of `w x h` pixels into a grayscale frame of `rows x cols`.
pub(super) fn warp_and_grayscale(
    w: usize,
    h: usize,
    rgb: Vec<u8>,
    (rows, cols): (usize, usize),
) -> Result<Vec<u8>> {
    let img = ImageBuffer::<Rgb<u8>, _>::from_vec(w as u32, h as u32, rgb)
        .context("Screen buffer does not match the screen size")?;
    let img = resize(&img, cols as u32, rows as u32, Triangle);
    let img: ImageBuffer<Luma<u8>, _> = grayscale(&img);
    Ok(img.into_raw())
}

/// Resizes a grayscale frame.
fn resize_gray(frame: Vec<u8>, (rows, cols): (usize, usize), to: (usize, usize)) -> Vec<u8> {
    if (rows, cols) == to {
        return frame;
    }
    // The length is checked by the caller, so the buffer always fits.
    match ImageBuffer::<Luma<u8>, _>::from_vec(cols as u32, rows as u32, frame) {
        Some(img) => resize(&img, to.1 as u32, to.0 as u32, Triangle).into_raw(),
        None => vec![0; to.0 * to.1],
    }
}

/// Location and geometry of the fovea in an observation frame.
///
/// Locations are the `[row, col]` of the top-left corner and always lie in
/// `[0, obs_size - fov_size]`.
#[derive(Debug, Clone)]
pub(crate) struct Fovea {
    obs_size: (usize, usize),
    size: (usize, usize),
    mode: SensoryActionMode,
    bounds: (i32, i32),
    mask_out: bool,
    resize_to_full: bool,
    loc: [i32; 2],
}

impl Fovea {
    pub fn new(
        obs_size: (usize, usize),
        size: (usize, usize),
        mode: SensoryActionMode,
        bounds: (i32, i32),
        mask_out: bool,
        resize_to_full: bool,
    ) -> Self {
        Self {
            obs_size,
            size,
            mode,
            bounds,
            mask_out,
            resize_to_full,
            loc: [0, 0],
        }
    }

    /// The largest valid location.
    pub fn max_loc(&self) -> [i32; 2] {
        [
            (self.obs_size.0 - self.size.0) as i32,
            (self.obs_size.1 - self.size.1) as i32,
        ]
    }

    /// Lower and upper bounds of sensory actions, `[row, col]`.
    pub fn action_bounds(&self) -> ([i32; 2], [i32; 2]) {
        match self.mode {
            SensoryActionMode::Absolute => ([0, 0], self.max_loc()),
            SensoryActionMode::Relative => {
                let (low, high) = self.bounds;
                ([low, low], [high, high])
            }
        }
    }

    pub fn loc(&self) -> [i32; 2] {
        self.loc
    }

    /// Places the fovea, clipping the location into the frame.
    pub fn place(&mut self, loc: [i32; 2]) {
        let max = self.max_loc();
        self.loc = [loc[0].clamp(0, max[0]), loc[1].clamp(0, max[1])];
    }

    /// Applies a sensory action. Returns `true` if the fovea moved.
    pub fn apply(&mut self, a: [i32; 2]) -> bool {
        let prev = self.loc;
        match self.mode {
            SensoryActionMode::Absolute => self.place(a),
            SensoryActionMode::Relative => {
                let (low, high) = self.bounds;
                let d = [a[0].clamp(low, high), a[1].clamp(low, high)];
                self.place([prev[0] + d[0], prev[1] + d[1]]);
            }
        }
        self.loc != prev
    }

    /// Shape `(rows, cols)` of the frames produced by [`Fovea::observe`].
    pub fn observed_size(&self) -> (usize, usize) {
        if self.mask_out || self.resize_to_full {
            self.obs_size
        } else {
            self.size
        }
    }

    /// Applies the fovea to a full-size grayscale frame.
    ///
    /// With `mask_out`, pixels outside of the fovea are zeroed. Otherwise the
    /// fovea is cropped, and resized to the full size with `resize_to_full`.
    pub fn observe(&self, frame: &[u8]) -> Vec<u8> {
        let (rows, cols) = self.obs_size;
        let (fh, fw) = self.size;
        let (r0, c0) = (self.loc[0] as usize, self.loc[1] as usize);
        debug_assert_eq!(frame.len(), rows * cols);

        if self.mask_out {
            let mut out = vec![0u8; rows * cols];
            for r in r0..r0 + fh {
                let ix = r * cols + c0;
                out[ix..ix + fw].copy_from_slice(&frame[ix..ix + fw]);
            }
            out
        } else {
            let mut crop = Vec::with_capacity(fh * fw);
            for r in r0..r0 + fh {
                let ix = r * cols + c0;
                crop.extend_from_slice(&frame[ix..ix + fw]);
            }
            if self.resize_to_full {
                resize_gray(crop, self.size, self.obs_size)
            } else {
                crop
            }
        }
    }
}

/// A stack of the most recent frames, oldest first.
#[derive(Debug, Clone)]
pub(crate) struct FrameStack {
    frames: Vec<u8>,
    n_stack: usize,
    frame_len: usize,
}

impl FrameStack {
    pub fn new(n_stack: usize, frame_len: usize) -> Self {
        Self {
            frames: vec![0; n_stack * frame_len],
            n_stack,
            frame_len,
        }
    }

    /// Fills all slots with the given frame.
    pub fn fill(&mut self, frame: &[u8]) {
        for chunk in self.frames.chunks_mut(self.frame_len) {
            chunk.copy_from_slice(frame);
        }
    }

    /// Drops the oldest frame and appends `frame`.
    pub fn push(&mut self, frame: &[u8]) {
        let n = self.frames.len();
        self.frames.copy_within(self.frame_len..n, 0);
        self.frames[(self.n_stack - 1) * self.frame_len..].copy_from_slice(frame);
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.frames.clone()
    }
}
