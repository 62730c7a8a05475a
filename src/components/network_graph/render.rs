use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::error::GraphError;
use crate::layout::Viewport;
use crate::scene::{LABEL_FILL, LINK_STROKE, LabelSprite, LinkSprite, NodeSprite, Scene};

const BACKGROUND: &str = "#f8fafc";
const LABEL_FONT: &str = "12px sans-serif";

/// Draw one frame, reporting canvas failures as [`GraphError::Render`].
pub fn draw(
	scene: &Scene,
	viewport: Viewport,
	ctx: &CanvasRenderingContext2d,
) -> Result<(), GraphError> {
	let result = render(scene, viewport, ctx);
	ctx.set_global_alpha(1.0);
	result.map_err(|e| GraphError::Render(format!("{e:?}")))
}

fn render(
	scene: &Scene,
	viewport: Viewport,
	ctx: &CanvasRenderingContext2d,
) -> Result<(), JsValue> {
	ctx.set_global_alpha(1.0);
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);

	ctx.set_stroke_style_str(LINK_STROKE);
	for link in &scene.links {
		draw_link(link, ctx);
	}
	for node in &scene.nodes {
		draw_node(node, ctx)?;
	}
	ctx.set_font(LABEL_FONT);
	ctx.set_fill_style_str(LABEL_FILL);
	for label in &scene.labels {
		draw_label(label, ctx)?;
	}
	Ok(())
}

fn draw_link(link: &LinkSprite, ctx: &CanvasRenderingContext2d) {
	ctx.set_global_alpha(link.opacity);
	ctx.set_line_width(link.width);
	ctx.begin_path();
	ctx.move_to(link.x1, link.y1);
	ctx.line_to(link.x2, link.y2);
	ctx.stroke();
}

fn draw_node(node: &NodeSprite, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	ctx.set_global_alpha(node.opacity);
	ctx.begin_path();
	ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI)?;
	ctx.set_fill_style_str(node.fill);
	ctx.fill();
	ctx.set_stroke_style_str(node.stroke);
	ctx.set_line_width(node.stroke_width);
	ctx.stroke();
	Ok(())
}

fn draw_label(label: &LabelSprite, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	ctx.set_global_alpha(label.opacity);
	ctx.fill_text(&label.text, label.x, label.y)
}
