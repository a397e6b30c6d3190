use trigon_engine::core::{App, AppControl, FrameCtx};
use trigon_engine::input::{InputEvent, InputFrame, Key, KeyState};
use trigon_engine::paint::Color;
use trigon_engine::render::TriangleRenderer;
use trigon_engine::shader::ShaderVariant;

/// Interactive triangle viewer.
///
/// Space cycles shader variants, digit keys select one directly, Escape exits.
/// The clear color follows the pointer.
pub struct TriangleApp {
    variant: ShaderVariant,
    clear: Color,
    renderer: TriangleRenderer,
}

impl TriangleApp {
    pub fn new(variant: ShaderVariant) -> Self {
        Self {
            variant,
            clear: Color::SLATE,
            renderer: TriangleRenderer::new(),
        }
    }

    pub fn variant(&self) -> ShaderVariant {
        self.variant
    }

    /// Applies this frame's key presses. Returns `Exit` on Escape.
    fn handle_keys(&mut self, frame: &InputFrame) -> AppControl {
        if frame.pressed(Key::Escape) {
            return AppControl::Exit;
        }

        // Latest digit press wins when several arrive in one frame.
        let selected = frame
            .events
            .iter()
            .filter_map(|ev| match ev {
                InputEvent::Key {
                    key,
                    state: KeyState::Pressed,
                    repeat: false,
                } => key.digit_index(),
                _ => None,
            })
            .filter_map(|i| ShaderVariant::ALL.get(i).copied())
            .next_back();

        let next = match selected {
            Some(v) => v,
            None if frame.pressed(Key::Space) => self.variant.next(),
            None => return AppControl::Continue,
        };

        if next != self.variant {
            log::info!("switching shader: {} -> {next}", self.variant);
            self.variant = next;
        }
        AppControl::Continue
    }

    fn title(&self) -> String {
        format!("trigon: {}", self.variant)
    }
}

impl App for TriangleApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let before = self.variant();
        if self.handle_keys(ctx.input_frame) == AppControl::Exit {
            return AppControl::Exit;
        }
        if before != self.variant || ctx.time.frame_index == 0 {
            ctx.window.set_title(&self.title());
        }

        if let Some(pos) = ctx.input.pointer_pos {
            self.clear = self.clear.from_pointer(pos, ctx.window.physical_size());
        }

        let variant = self.variant;
        let renderer = &mut self.renderer;
        ctx.render(self.clear, |rctx, target| renderer.render(rctx, target, variant))
    }
}
