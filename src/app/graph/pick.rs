use eframe::egui::Pos2;

#[derive(Clone, Copy, Debug)]
struct PickDisk {
    node: usize,
    center: Pos2,
    radius: f32,
}

/// Off-screen hit regions for the nodes drawn this frame, in draw order.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct PickBuffer {
    disks: Vec<PickDisk>,
}

impl PickBuffer {
    pub(in crate::app) fn clear(&mut self) {
        self.disks.clear();
    }

    pub(in crate::app) fn push_disk(&mut self, node: usize, center: Pos2, radius: f32) {
        self.disks.push(PickDisk {
            node,
            center,
            radius,
        });
    }

    /// The last-drawn disk containing `pointer` wins, the same way the
    /// topmost painted pixel would.
    pub(in crate::app) fn pick(&self, pointer: Pos2) -> Option<usize> {
        self.disks
            .iter()
            .rev()
            .find(|disk| disk.center.distance_sq(pointer) <= disk.radius * disk.radius)
            .map(|disk| disk.node)
    }
}
