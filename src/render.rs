use std::path::{Path, PathBuf};

use colors_transform::{Color, Hsl};
use image::{ImageResult, Rgb, RgbImage};

use crate::boids::BoidView;

const BACKGROUND: Rgb<u8> = Rgb([240, 248, 255]);
const ARROW_HALF_LENGTH: i32 = 3;

/// Colour a boid by the direction it faces, so aligned groups share a hue.
pub fn heading_colour(heading: f64) -> Rgb<u8> {
    let hue = heading.to_degrees().rem_euclid(360.0) as f32;
    let rgb = Hsl::from(hue, 70.0, 45.0).to_rgb();
    Rgb([
        rgb.get_red().round() as u8,
        rgb.get_green().round() as u8,
        rgb.get_blue().round() as u8,
    ])
}

/// Draws every boid as a short stroke pointing along its heading. World y
/// grows upward, image rows grow downward.
pub fn render_frame<'a>(
    views: impl IntoIterator<Item = &'a BoidView>,
    bound_max: f64,
) -> RgbImage {
    let side = (bound_max.ceil() as u32).saturating_add(1);
    let mut img = RgbImage::from_pixel(side, side, BACKGROUND);
    for view in views {
        let colour = heading_colour(view.heading);
        let (dx, dy) = (view.heading.cos(), view.heading.sin());
        for step in -ARROW_HALF_LENGTH..=ARROW_HALF_LENGTH {
            let t = f64::from(step);
            plot(&mut img, view.position.x + dx * t, view.position.y + dy * t, colour);
        }
    }
    img
}

fn plot(img: &mut RgbImage, x: f64, y: f64, colour: Rgb<u8>) {
    let (width, height) = img.dimensions();
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (px, py) = (x.round() as u32, y.round() as u32);
    if px >= width || py >= height {
        return;
    }
    img.put_pixel(px, height - 1 - py, colour);
}

pub fn frame_path(dir: &Path, frame: u64) -> PathBuf {
    dir.join(format!("frames_{:0>8}.png", frame))
}

pub fn save_frame(img: &RgbImage, dir: &Path, frame: u64) -> ImageResult<PathBuf> {
    let path = frame_path(dir, frame);
    img.save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2;
    use std::f64::consts::PI;

    #[test]
    fn boid_is_drawn_at_its_flipped_position() {
        let view = BoidView {
            position: Vec2::new(20.0, 10.0),
            heading: 0.0,
        };
        let img = render_frame([&view], 100.0);
        assert_eq!(img.dimensions(), (101, 101));
        assert_eq!(*img.get_pixel(20, 90), heading_colour(0.0));
        assert_eq!(*img.get_pixel(20, 10), BACKGROUND);
    }

    #[test]
    fn boids_at_the_wall_stay_on_canvas() {
        let views = [
            BoidView {
                position: Vec2::new(0.0, 0.0),
                heading: PI,
            },
            BoidView {
                position: Vec2::new(50.0, 50.0),
                heading: PI / 4.0,
            },
        ];
        let img = render_frame(&views, 50.0);
        assert_eq!(*img.get_pixel(0, 50), heading_colour(PI));
        assert_eq!(*img.get_pixel(50, 0), heading_colour(PI / 4.0));
    }

    #[test]
    fn opposite_headings_get_different_colours() {
        assert_ne!(heading_colour(0.0), heading_colour(PI));
        assert_eq!(heading_colour(-PI / 2.0), heading_colour(3.0 * PI / 2.0));
    }

    #[test]
    fn frames_are_zero_padded() {
        assert_eq!(
            frame_path(Path::new("out"), 42),
            PathBuf::from("out/frames_00000042.png")
        );
    }
}
