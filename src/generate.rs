use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbImage};
use num_traits::ToPrimitive;
use rand::distr::Distribution;
use rand::prelude::*;
use std::io::Cursor;

use super::{
    choice::*,
    color::*,
    error::*
};

/// Row-major color names, `height` rows of `width` entries.
pub type Grid = Vec<Vec<String>>;

/// Truncates toward zero and clamps to at least 1. Non-finite input becomes 1.
pub fn clamp_dim(value: impl ToPrimitive) -> u32 {
    match value.to_f64() {
        Some(v) if v.is_finite() => v.trunc().clamp(1.0, u32::MAX as f64) as u32,
        _ => 1,
    }
}

/// Largest raster, in pixels, that [`render`] will allocate.
pub const MAX_PIXELS: u64 = 1 << 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub width: u32,
    pub height: u32,
    pub block_px: u32,
}

impl GridConfig {
    pub fn new(width: impl ToPrimitive, height: impl ToPrimitive, block_px: impl ToPrimitive) -> Self {
        GridConfig {
            width: clamp_dim(width),
            height: clamp_dim(height),
            block_px: clamp_dim(block_px),
        }
    }

    /// Raster size in pixels, or `None` if it exceeds [`MAX_PIXELS`].
    pub fn image_dims(&self) -> Option<(u32, u32)> {
        let width = self.width.checked_mul(self.block_px)?;
        let height = self.height.checked_mul(self.block_px)?;
        if width as u64 * height as u64 > MAX_PIXELS {
            return None;
        }
        Some((width, height))
    }
}

/// Cumulative-weight distribution over a raw choice list. Duplicate names stay
/// separate entries, so they add up in effective probability.
///
/// A list whose weights sum to exactly zero is treated as uniform over its
/// entries rather than rejected. Individual non-positive weights are left as
/// they are.
#[derive(Debug, Clone)]
pub struct Sampler<'a> {
    choices: &'a [Choice],
    cumulative: Vec<f64>,
}

impl<'a> Sampler<'a> {
    pub fn new(choices: &'a [Choice]) -> Result<Sampler<'a>, GenerateError> {
        if choices.is_empty() {
            return Err(GenerateError::EmptyChoices)
        }

        let mut total: f64 = choices.iter().map(|c| c.weight).sum();
        let uniform = total == 0.0;
        if uniform {
            total = choices.len() as f64;
        }

        let mut x = 0.0;
        let cumulative = choices
            .iter()
            .map(|c| {
                let weight = if uniform { 1.0 } else { c.weight };
                x += weight / total;
                x
            })
            .collect();

        Ok(Sampler { choices, cumulative })
    }
}

impl<'a> Distribution<&'a Choice> for Sampler<'a> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a Choice {
        let r: f64 = rng.random();
        let i = self.cumulative
            .iter()
            .position(|&c| r < c)
            .unwrap_or(self.cumulative.len() - 1);
        &self.choices[i]
    }
}

#[derive(Debug, Clone)]
pub struct Artwork {
    pub image: RgbImage,
    pub grid: Grid,
}

impl Artwork {
    pub fn png_bytes(&self) -> Result<Vec<u8>, GenerateError> {
        let mut bytes = Vec::new();
        self.image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    pub fn png_base64(&self) -> Result<String, GenerateError> {
        Ok(STANDARD.encode(self.png_bytes()?))
    }
}

/// Samples one choice per block and paints each block as a solid
/// `block_px`-sided square.
pub fn render(cfg: GridConfig, choices: &[Choice], rng: &mut impl Rng) -> Result<Artwork, GenerateError> {
    let sampler = Sampler::new(choices)?;
    let (img_width, img_height) = cfg.image_dims().ok_or(GenerateError::TooLarge)?;

    let mut grid: Grid = Vec::with_capacity(cfg.height as usize);
    let mut colors: Vec<Color> = Vec::with_capacity(cfg.width as usize * cfg.height as usize);

    for _ in 0 .. cfg.height {
        let row: Vec<String> = (&sampler)
            .sample_iter(&mut *rng)
            .take(cfg.width as usize)
            .map(|c| c.name.clone())
            .collect();
        colors.extend(row.iter().map(|name| Palette.sample(name)));
        grid.push(row);
    }

    let px = cfg.block_px;
    let image = RgbImage::from_fn(img_width, img_height, |x, y| {
        colors[(y / px) as usize * cfg.width as usize + (x / px) as usize].into()
    });

    Ok(Artwork { image, grid })
}

/// Generates block art and returns it as base64-encoded PNG text together with
/// the grid of chosen names. Dimensions are clamped, never rejected, except
/// that rasters above [`MAX_PIXELS`] fail with [`GenerateError::TooLarge`].
pub fn generate(
    width: impl ToPrimitive,
    height: impl ToPrimitive,
    choices: &[Choice],
    block_px: impl ToPrimitive,
) -> Result<(String, Grid), GenerateError> {
    let artwork = render(GridConfig::new(width, height, block_px), choices, &mut rand::rng())?;
    Ok((artwork.png_base64()?, artwork.grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;
    use rand::rngs::StdRng;

    fn choices(list: &[(&str, f64)]) -> Vec<Choice> {
        list.iter().map(|&(n, w)| Choice::new(n, w)).collect()
    }

    fn decode(b64: &str) -> image::DynamicImage {
        let bytes = STANDARD.decode(b64).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        image::load_from_memory(&bytes).unwrap()
    }

    fn assert_shape(grid: &Grid, width: usize, height: usize) {
        assert_eq!(grid.len(), height);
        assert!(grid.iter().all(|row| row.len() == width));
    }

    #[test]
    fn returns_base64_and_grid() {
        let (b64, grid) = generate(4, 3, &choices(&[("red", 1.), ("blue", 1.)]), 16).unwrap();
        assert!(!b64.is_empty());
        assert_shape(&grid, 4, 3);
    }

    #[test]
    fn grid_dimensions() {
        for (w, h) in [(1, 1), (10, 5), (3, 7), (20, 20)] {
            let (_, grid) = generate(w, h, &choices(&[("white", 1.)]), 16).unwrap();
            assert_shape(&grid, w, h);
        }
    }

    #[test]
    fn image_dimensions() {
        for (w, h, px) in [(6u32, 4u32, 16u32), (2, 3, 32), (1, 1, 1)] {
            let (b64, grid) = generate(w, h, &choices(&[("pink", 1.)]), px).unwrap();
            assert_eq!(decode(&b64).dimensions(), (w * px, h * px));
            assert_shape(&grid, w as usize, h as usize);
        }
    }

    #[test]
    fn single_choice_fills_grid() {
        let (_, grid) = generate(5, 5, &choices(&[("green", 1.)]), 16).unwrap();
        assert!(grid.iter().flatten().all(|name| name == "green"));
    }

    #[test]
    fn zero_weights_fall_back_to_uniform() {
        let list = choices(&[("red", 0.), ("blue", 0.), ("yellow", 0.)]);
        let mut rng = StdRng::seed_from_u64(7);
        let art = render(GridConfig::new(30, 30, 1), &list, &mut rng).unwrap();
        assert_shape(&art.grid, 30, 30);
        for name in ["red", "blue", "yellow"] {
            assert!(art.grid.iter().flatten().any(|n| n == name), "{name} never drawn");
        }
    }

    #[test]
    fn dimensions_are_clamped() {
        assert_eq!(GridConfig::new(0, -3, 2.7), GridConfig { width: 1, height: 1, block_px: 2 });
        assert_eq!(GridConfig::new(f64::NAN, 4.99, -0.5), GridConfig { width: 1, height: 4, block_px: 1 });

        let (b64, grid) = generate(0, -5, &choices(&[("black", 1.)]), 0).unwrap();
        assert_shape(&grid, 1, 1);
        assert_eq!(decode(&b64).dimensions(), (1, 1));
    }

    #[test]
    fn oversized_raster_is_an_error() {
        let list = choices(&[("red", 1.)]);
        assert!(matches!(generate(100_000, 100_000, &list, 1), Err(GenerateError::TooLarge)));
        assert!(matches!(generate(1, 1, &list, u32::MAX), Err(GenerateError::TooLarge)));
        assert_eq!(GridConfig::new(16_384, 16_384, 1).image_dims(), Some((16_384, 16_384)));
        assert_eq!(GridConfig::new(16_385, 16_384, 1).image_dims(), None);
    }

    #[test]
    fn empty_choices_is_an_error() {
        assert!(matches!(generate(2, 2, &[], 4), Err(GenerateError::EmptyChoices)));
    }

    #[test]
    fn blocks_match_grid() {
        let list = choices(&[("red", 1.), ("cyan", 1.), ("not_a_dye", 1.)]);
        let px = 5;
        let art = render(GridConfig::new(7, 4, px), &list, &mut StdRng::seed_from_u64(1)).unwrap();
        let img = decode(&art.png_base64().unwrap()).to_rgb8();

        for (by, row) in art.grid.iter().enumerate() {
            for (bx, name) in row.iter().enumerate() {
                let expected = Palette.sample(name).to_array();
                for y in by as u32 * px .. (by as u32 + 1) * px {
                    for x in bx as u32 * px .. (bx as u32 + 1) * px {
                        assert_eq!(img.get_pixel(x, y).0, expected, "pixel ({x}, {y})");
                    }
                }
            }
        }
    }

    #[test]
    fn unknown_name_renders_sentinel() {
        let art = render(GridConfig::new(2, 2, 3), &choices(&[("mauve", 1.)]), &mut rand::rng()).unwrap();
        assert!(art.image.pixels().all(|p| p.0 == [255, 0, 255]));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let list = choices(&[("red", 1.), ("blue", 2.), ("lime", 3.)]);
        let cfg = GridConfig::new(12, 9, 2);
        let a = render(cfg, &list, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = render(cfg, &list, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.image, b.image);
    }

    #[test]
    fn frequencies_follow_weights() {
        let list = choices(&[("red", 3.), ("blue", 1.)]);
        let art = render(GridConfig::new(100, 100, 1), &list, &mut StdRng::seed_from_u64(3)).unwrap();
        let red = art.grid.iter().flatten().filter(|n| *n == "red").count() as f64;
        let share = red / 10_000.;
        assert!((share - 0.75).abs() < 0.03, "red share {share}");
    }

    #[test]
    fn duplicates_add_probability() {
        let list = choices(&[("red", 1.), ("blue", 1.), ("red", 1.), ("red", 1.)]);
        let art = render(GridConfig::new(100, 100, 1), &list, &mut StdRng::seed_from_u64(9)).unwrap();
        let red = art.grid.iter().flatten().filter(|n| *n == "red").count() as f64;
        let share = red / 10_000.;
        assert!((share - 0.75).abs() < 0.03, "red share {share}");
    }

    #[test]
    fn zero_weight_entry_is_never_drawn() {
        let list = choices(&[("red", 0.), ("blue", 1.)]);
        let art = render(GridConfig::new(50, 50, 1), &list, &mut StdRng::seed_from_u64(5)).unwrap();
        assert!(art.grid.iter().flatten().all(|n| n == "blue"));
    }
}
