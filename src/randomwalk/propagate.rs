use crate::randomwalk::seeds::{Coord, SeedSet};
use crate::{Mask, MASK_BACKGROUND, MASK_FOREGROUND};
use image::Luma;
use imageproc::distance_transform::Norm;
use imageproc::map::map_colors;
use imageproc::morphology::{dilate_mut, erode_mut};

/// 収縮・膨張に使う構造要素の連結性
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// 4近傍（十字型の構造要素）
    Four,
    /// 8近傍（3x3の構造要素）
    #[default]
    Eight,
}

impl Connectivity {
    /// 半径1の操作が対応する構造要素と一致するノルム
    const fn norm(self) -> Norm {
        match self {
            Self::Four => Norm::L1,
            Self::Eight => Norm::LInf,
        }
    }
}

/// 既定の収縮回数
pub const DEFAULT_PROPAGATION_ITERATIONS: u32 = 3;

/// 前フレームのマスクから次フレームのシードを作る
///
/// 前景シードはマスクを `iterations` 回収縮した領域、
/// 背景シードはマスクを `round(iterations * 1.5)` 回膨張した領域の外側です。
/// その間の幅およそ `iterations` ピクセルの帯はシードを持たず、
/// 次フレームの拡散が境界を決めます。
///
/// 収縮・膨張は半径1の操作を繰り返して行います。
/// 画像の外側は収縮では背景、膨張では前景として扱いません。
///
/// # Examples
///
/// ```rust
/// use randomwalk_seg::{SeedPropagator, MASK_FOREGROUND};
/// use image::{GrayImage, Luma};
///
/// let mut mask = GrayImage::new(20, 20);
/// for y in 5..15 {
///     for x in 5..15 {
///         mask.put_pixel(x, y, Luma([MASK_FOREGROUND]));
///     }
/// }
///
/// let seeds = SeedPropagator::new(1).propagate(&mask);
/// assert_eq!(seeds.foreground().len(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeedPropagator {
    iterations: u32,
    connectivity: Connectivity,
}

impl Default for SeedPropagator {
    fn default() -> Self {
        Self::new(DEFAULT_PROPAGATION_ITERATIONS)
    }
}

impl SeedPropagator {
    /// 8近傍で `iterations` 回収縮するプロパゲータを作成する
    #[must_use]
    pub const fn new(iterations: u32) -> Self {
        Self {
            iterations,
            connectivity: Connectivity::Eight,
        }
    }

    /// 連結性を変更する
    #[must_use]
    pub const fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    #[must_use]
    pub const fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// 背景側の膨張回数 `round(iterations * 1.5)`
    #[must_use]
    pub fn expansion_iterations(&self) -> u32 {
        (f64::from(self.iterations) * 1.5).round() as u32
    }

    /// マスクからシードを作成する
    ///
    /// # 引数
    ///
    /// * `mask` - 前フレームの二値マスク（0以外を前景とみなす）
    ///
    /// # 戻り値
    ///
    /// 行優先順に並んだ前景・背景シード
    #[must_use]
    pub fn propagate(&self, mask: &Mask) -> SeedSet {
        let norm = self.connectivity.norm();
        let binary = binarize(mask);

        let mut shrunk = binary.clone();
        for _ in 0..self.iterations {
            erode_mut(&mut shrunk, norm, 1);
        }

        let mut expanded = binary.clone();
        for _ in 0..self.expansion_iterations() {
            dilate_mut(&mut expanded, norm, 1);
        }
        // 膨張後の領域は元の前景を必ず含む
        for (e, b) in expanded.pixels_mut().zip(binary.pixels()) {
            e[0] |= b[0];
        }

        let foreground = collect_coords(&shrunk, |v| v != MASK_BACKGROUND);
        let background = collect_coords(&expanded, |v| v == MASK_BACKGROUND);

        log::debug!(
            "propagated seeds: {} foreground, {} background (erode {}, dilate {})",
            foreground.len(),
            background.len(),
            self.iterations,
            self.expansion_iterations()
        );

        SeedSet::new(foreground, background)
    }
}

/// 任意の0以外の値を前景値に揃える
fn binarize(mask: &Mask) -> Mask {
    map_colors(mask, |Luma([v])| {
        if v == MASK_BACKGROUND {
            Luma([MASK_BACKGROUND])
        } else {
            Luma([MASK_FOREGROUND])
        }
    })
}

fn collect_coords<F>(mask: &Mask, predicate: F) -> Vec<Coord>
where
    F: Fn(u8) -> bool,
{
    mask.enumerate_pixels()
        .filter(|(_, _, p)| predicate(p[0]))
        .map(|(x, y, _)| Coord::new(x, y))
        .collect()
}
