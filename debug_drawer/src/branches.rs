use glimmer_core::math::Vec3;
use glimmer_core::TransformStack;
use glimmer_graphics::{GraphicsError, ImmediateMeshBuilder, PrimitiveTopology};

/// Rotation of each child branch away from its parent, in degrees.
pub const BRANCH_SPREAD_DEGREES: f32 = 25.0;

/// Length ratio between a child branch and its parent.
pub const BRANCH_SHRINK: f32 = 0.7;

const BRANCH_COLOR: [f32; 4] = [0.55, 0.8, 0.35, 1.0];

/// Draw a binary branching figure along the current model-view +Y axis.
///
/// Each level draws its segment as its own batch, then forks twice, rotated
/// by [`BRANCH_SPREAD_DEGREES`] about Z and scaled by [`BRANCH_SHRINK`].
/// `depth` levels issue `2^depth - 1` draws. The stack is back at its entry
/// depth when this returns, including on error.
pub fn draw_branches(
    builder: &mut ImmediateMeshBuilder,
    stack: &mut TransformStack,
    depth: u32,
    length: f32,
) -> Result<(), GraphicsError> {
    if depth == 0 {
        return Ok(());
    }

    let mut scope = stack.scoped();

    let [r, g, b, a] = BRANCH_COLOR;
    builder
        .begin(PrimitiveTopology::LineList)
        .color(r, g, b, a)
        .vertex(0.0, 0.0, 0.0)
        .vertex(0.0, length, 0.0);
    builder.end_with(&scope)?;

    scope.translate(Vec3::new(0.0, length, 0.0));
    scope.scale(Vec3::repeat(BRANCH_SHRINK));

    for side in [1.0, -1.0] {
        let mut child = scope.scoped();
        child.rotate(side * BRANCH_SPREAD_DEGREES, Vec3::z());
        draw_branches(builder, &mut child, depth - 1, length)?;
    }

    Ok(())
}
