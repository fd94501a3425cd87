use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

/// Where one interleaved attribute lands in the shader's input slots.
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub offset: i32,
}

/// Location 0 = position, location 1 = color. The `layout (location = ...)`
/// qualifiers in the vertex shader must stay in agreement with this table.
pub const ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute { location: 0, components: 2, offset: 0 },
    VertexAttribute { location: 1, components: 3, offset: 12 },
];

pub const STRIDE: i32 = size_of::<Vertex>() as i32;

// One corner per primary color, counter-clockwise from bottom-left
pub const VERTICES: &[Vertex] = &[
    Vertex { position: [-0.5, -0.5], color: [1.0, 0.0, 0.0] },
    Vertex { position: [ 0.5, -0.5], color: [0.0, 1.0, 0.0] },
    Vertex { position: [ 0.0,  0.5], color: [0.0, 0.0, 1.0] },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_vertices_of_five_floats() {
        assert_eq!(VERTICES.len(), 3);
        assert_eq!(STRIDE, 20);
        let floats: &[f32] = bytemuck::cast_slice(VERTICES);
        assert_eq!(floats.len(), 15);
    }

    #[test]
    fn byte_image_matches_interleaved_floats() {
        let floats: &[f32] = bytemuck::cast_slice(VERTICES);
        #[rustfmt::skip]
        let expected: [f32; 15] = [
            -0.5, -0.5, 1.0, 0.0, 0.0,
             0.5, -0.5, 0.0, 1.0, 0.0,
             0.0,  0.5, 0.0, 0.0, 1.0,
        ];
        assert_eq!(floats, &expected);
    }

    #[test]
    fn attribute_table_covers_locations_zero_and_one() {
        assert_eq!(ATTRIBUTES[0].location, 0);
        assert_eq!(ATTRIBUTES[0].components, 2);
        assert_eq!(ATTRIBUTES[0].offset, 0);

        assert_eq!(ATTRIBUTES[1].location, 1);
        assert_eq!(ATTRIBUTES[1].components, 3);
        assert_eq!(ATTRIBUTES[1].offset, 12);
    }
}
