use crate::config::SvgOptions;
use opack::{Instance, Solution};
use svg::Document;
use svg::node::element::{Group, Rectangle as SvgRect, Text};

/// Renders a feasible placement: the box outline plus one labeled tile per
/// rectangle. Coordinates are flipped so y grows upward, matching the
/// engine's convention.
pub fn solution_to_svg(solution: &Solution, instance: &Instance, options: SvgOptions) -> Document {
    let u = options.unit;
    let (bw, bh) = (
        solution.box_dims.width as f32 * u,
        solution.box_dims.height as f32 * u,
    );

    let mut group = Group::new().add(
        SvgRect::new()
            .set("x", 0.0)
            .set("y", 0.0)
            .set("width", bw)
            .set("height", bh)
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", options.stroke_width * 2.0),
    );

    for p in &solution.placements {
        let r = &instance.rects[p.id];
        let (w, h) = if p.rotated { (r.height, r.width) } else { (r.width, r.height) };
        let (x, y) = (p.x as f32 * u, bh - (p.y + h) as f32 * u);
        let hue = (p.id * 360) / instance.len().max(1);
        group = group
            .add(
                SvgRect::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", w as f32 * u)
                    .set("height", h as f32 * u)
                    .set("fill", format!("hsl({hue}, 60%, 70%)"))
                    .set("stroke", "black")
                    .set("stroke-width", options.stroke_width),
            )
            .add(
                Text::new(format!("{}", p.id))
                    .set("x", x + w as f32 * u / 2.0)
                    .set("y", y + h as f32 * u / 2.0)
                    .set("text-anchor", "middle")
                    .set("dominant-baseline", "central")
                    .set("font-size", u * 0.4),
            );
    }

    Document::new()
        .set("viewBox", (0.0, 0.0, bw, bh))
        .set("width", bw)
        .set("height", bh)
        .add(group)
}
