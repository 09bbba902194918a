use crate::config::PenConfig;
use crate::math::Pose;
use crate::painting::{pixel_center, PaintColor, PaintSampler, PenTip, Raycaster};
use crate::pen::message::{
    BrushMessage, DrawMessage, OwnershipMessage, PenMessage, StampEvent, TransformMessage,
};
use crate::pen::{BrushState, MessageChannel};
use crate::scene::SharedScene;
use crate::websocket::message::Envelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenState {
    Idle,
    Drawing,
}

/// World poses of the two painting ends of the pen
#[derive(Debug, Clone, Copy, Default)]
pub struct PenTips {
    pub nib: Pose,
    pub eraser: Pose,
}

/// A shared pen.
///
/// Every participant holds a copy under the same object id. The owning copy
/// samples the scene and broadcasts stamps; the others replay what they
/// receive. Ownership goes to whoever claimed it last.
pub struct Pen<C: MessageChannel> {
    object_id: String,
    participant_id: String,
    owner_id: Option<String>,
    has_ownership: bool,
    state: PenState,
    pose: Pose,
    brush: BrushState,
    sampler: PaintSampler,
    channel: C,
    scene: SharedScene,
}

impl<C: MessageChannel> Pen<C> {
    pub fn new(
        object_id: impl Into<String>,
        participant_id: impl Into<String>,
        config: &PenConfig,
        channel: C,
        scene: SharedScene,
    ) -> Self {
        Self {
            object_id: object_id.into(),
            participant_id: participant_id.into(),
            owner_id: None,
            has_ownership: false,
            state: PenState::Idle,
            pose: Pose::default(),
            brush: BrushState::from_config(config),
            sampler: PaintSampler::new(config),
            channel,
            scene,
        }
    }

    /// Grab/activate: start drawing and claim the pen
    pub fn activate(&mut self) {
        self.state = PenState::Drawing;
        self.take_ownership();
    }

    /// Release/deactivate: stop emitting stamps
    pub fn deactivate(&mut self) {
        self.state = PenState::Idle;
    }

    fn take_ownership(&mut self) {
        if self.has_ownership && self.owner_id.as_deref() == Some(self.participant_id.as_str()) {
            return;
        }

        self.owner_id = Some(self.participant_id.clone());
        self.has_ownership = true;
        tracing::info!("{} took ownership of {}", self.participant_id, self.object_id);

        self.channel.send(PenMessage::from(OwnershipMessage {
            owner_id: self.participant_id.clone(),
            take_ownership: true,
        }));
    }

    /// Per-frame sampling. Casts from the nib with the brush color and from
    /// the eraser with the clear color; each hit is stamped locally and sent
    /// to peers. Returns the stamps made this frame.
    pub fn update<R: Raycaster + ?Sized>(
        &mut self,
        raycaster: &R,
        tips: &PenTips,
    ) -> Vec<StampEvent> {
        if !self.has_ownership || self.state != PenState::Drawing {
            return Vec::new();
        }

        let passes = [
            (PenTip::Nib, tips.nib, self.brush.color()),
            (PenTip::Eraser, tips.eraser, PaintColor::CLEAR),
        ];

        let mut stamps = Vec::with_capacity(passes.len());
        for (tip, pose, color) in passes {
            if let Some(event) = self.paint_from(raycaster, tip, &pose, color) {
                self.channel.send(PenMessage::from(DrawMessage::from(event.clone())));
                stamps.push(event);
            }
        }
        stamps
    }

    fn paint_from<R: Raycaster + ?Sized>(
        &self,
        raycaster: &R,
        tip: PenTip,
        pose: &Pose,
        color: PaintColor,
    ) -> Option<StampEvent> {
        let hit = self.sampler.sample(raycaster, tip, pose)?;

        let mut scene = self.scene.borrow_mut();
        let surface_path = scene.registry().path_of(hit.surface)?.to_string();
        let mask = scene.mask_mut(hit.surface)?;

        let center = pixel_center(hit.texture_coord, mask.width(), mask.height());
        let size = self.brush.size();
        mask.stamp(center, color, size);

        Some(StampEvent {
            surface_path,
            center,
            color,
            size,
        })
    }

    /// Fixed-rate pose broadcast from the owning copy
    pub fn fixed_update(&mut self) {
        if self.has_ownership {
            let is_drawing = self.is_drawing();
            self.channel
                .send(PenMessage::from(TransformMessage::new(&self.pose, is_drawing)));
        }
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.brush.set_size(size);
        self.send_brush();
    }

    pub fn set_brush_red(&mut self, red: f32) {
        self.brush.set_red(red);
        self.send_brush();
    }

    pub fn set_brush_green(&mut self, green: f32) {
        self.brush.set_green(green);
        self.send_brush();
    }

    pub fn set_brush_blue(&mut self, blue: f32) {
        self.brush.set_blue(blue);
        self.send_brush();
    }

    fn send_brush(&mut self) {
        self.channel.send(PenMessage::from(self.brush.to_message()));
    }

    /// Handle an envelope from the transport; envelopes for other objects
    /// are ignored.
    pub fn receive_envelope(&mut self, envelope: Envelope) -> bool {
        if envelope.object_id != self.object_id {
            return false;
        }
        match envelope.into_pen_message() {
            Ok(msg) => {
                self.handle(msg);
                true
            }
            Err(e) => {
                tracing::debug!("Ignoring message for {}: {}", self.object_id, e);
                false
            }
        }
    }

    /// Handle a raw JSON payload. Malformed payloads are ignored.
    pub fn receive(&mut self, payload: &str) -> bool {
        match PenMessage::parse(payload) {
            Ok(msg) => {
                self.handle(msg);
                true
            }
            Err(e) => {
                tracing::debug!("Ignoring message for {}: {}", self.object_id, e);
                false
            }
        }
    }

    pub fn handle(&mut self, msg: PenMessage) {
        match msg {
            PenMessage::Transform(m) => self.handle_transform(m),
            PenMessage::Draw(m) => self.handle_draw(m),
            PenMessage::Brush(m) => self.handle_brush(m),
            PenMessage::Ownership(m) => self.handle_ownership(m),
        }
    }

    fn handle_transform(&mut self, msg: TransformMessage) {
        self.pose = msg.pose();
        if !self.has_ownership {
            self.state = if msg.is_drawing {
                PenState::Drawing
            } else {
                PenState::Idle
            };
        }
    }

    fn handle_draw(&mut self, msg: DrawMessage) {
        let event = StampEvent::from(msg);
        self.scene.borrow_mut().apply_stamp(&event);
    }

    fn handle_brush(&mut self, msg: BrushMessage) {
        self.brush.overwrite(&msg);
        tracing::trace!(
            "Brush of {} now {:?}, tint {:?}",
            self.object_id,
            self.brush,
            self.body_tint()
        );
    }

    fn handle_ownership(&mut self, msg: OwnershipMessage) {
        // The local claim is left alone; any other claim wins
        if msg.owner_id != self.participant_id {
            if self.has_ownership {
                tracing::info!(
                    "{} lost {} to {}",
                    self.participant_id,
                    self.object_id,
                    msg.owner_id
                );
            }
            self.has_ownership = false;
        }
        self.owner_id = Some(msg.owner_id);
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    pub fn has_ownership(&self) -> bool {
        self.has_ownership
    }

    pub fn state(&self) -> PenState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state == PenState::Drawing
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    /// Current pen body tint, derived from brush color and ownership
    pub fn body_tint(&self) -> PaintColor {
        self.brush.body_tint(self.has_ownership)
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }
}
