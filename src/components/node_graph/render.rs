use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::node::Node;
use super::state::SimulationState;

const BACKGROUND: &str = "#050505";
const LABEL_FONT: &str = "11px JetBrains Mono";
const MIN_DRAWN_OPACITY: f64 = 0.01;
const EMPHASIS_OPACITY: f64 = 0.5;

pub fn render(state: &SimulationState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_edges(state, ctx);
	for node in state.nodes() {
		draw_node(state, node, ctx);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_edges(state: &SimulationState, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_width(0.5);
	for edge in state.edges() {
		ctx.set_stroke_style_str(&format!("rgba({}, {})", edge.rgb, edge.alpha));
		ctx.begin_path();
		ctx.move_to(edge.ax, edge.ay);
		ctx.line_to(edge.bx, edge.by);
		ctx.stroke();
	}
}

fn draw_node(state: &SimulationState, node: &Node, ctx: &CanvasRenderingContext2d) {
	if node.current_opacity < MIN_DRAWN_OPACITY {
		return;
	}
	let emphasized = node.current_opacity > EMPHASIS_OPACITY
		&& (node.hovered || state.is_selected(node.id()));

	ctx.set_global_alpha(node.current_opacity);
	ctx.begin_path();
	let _ = ctx.arc(node.x, node.y, node.current_radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(node.color());
	if emphasized {
		ctx.set_shadow_blur(20.0);
		ctx.set_shadow_color(node.color());
	}
	ctx.fill();
	ctx.set_shadow_blur(0.0);

	let title = &node.record().title;
	if emphasized && !title.is_empty() {
		ctx.set_fill_style_str("#fff");
		ctx.set_font(LABEL_FONT);
		ctx.set_text_align("center");
		let _ = ctx.fill_text(title, node.x, node.y - (node.current_radius + 10.0));
	}
	ctx.set_global_alpha(1.0);
}
