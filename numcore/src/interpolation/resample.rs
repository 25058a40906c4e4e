use common::parallel::for_each_row_band;
use common::Buffer2;

use super::BidimensionalInterpolation;

/// Fills `output` by interpolating the source at `map(x, y)` for every output
/// pixel `(x, y)`.
///
/// Rows are processed in parallel bands. Mapped coordinates outside
/// `[0, width) x [0, height)` of the source receive the border fill value
/// (0 under mirroring).
pub fn resample<I, M>(interpolator: &I, output: &mut Buffer2<f64>, map: M)
where
    I: BidimensionalInterpolation + Sync,
    M: Fn(usize, usize) -> (f64, f64) + Sync,
{
    let src_width = interpolator.width() as f64;
    let src_height = interpolator.height() as f64;
    let outside = interpolator.border().fill_value();
    let width = output.width();
    let height = output.height();

    tracing::debug!(
        "Resampling {}x{} source into {}x{} output",
        interpolator.width(),
        interpolator.height(),
        width,
        height
    );

    for_each_row_band(output.pixels_mut(), width, height, |first_row, band| {
        for (i, row) in band.chunks_exact_mut(width).enumerate() {
            let y = first_row + i;
            for (x, out) in row.iter_mut().enumerate() {
                let (sx, sy) = map(x, y);
                *out = if sx >= 0.0 && sx < src_width && sy >= 0.0 && sy < src_height {
                    interpolator.interpolate(sx, sy)
                } else {
                    outside
                };
            }
        }
    });
}
