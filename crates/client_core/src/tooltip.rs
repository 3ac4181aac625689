pub const TOOLTIP_OFFSET_X: f32 = 10.0;
pub const TOOLTIP_OFFSET_Y: f32 = 20.0;

/// Floating hint shown next to the pointer. One instance is shared by the whole list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TooltipState {
    pub visible: bool,
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl TooltipState {
    pub fn pointer_moved(&mut self, text: impl Into<String>, pointer_x: f32, pointer_y: f32) {
        self.visible = true;
        self.text = text.into();
        self.x = pointer_x + TOOLTIP_OFFSET_X;
        self.y = pointer_y + TOOLTIP_OFFSET_Y;
    }

    pub fn pointer_left(&mut self) {
        *self = Self::default();
    }
}
