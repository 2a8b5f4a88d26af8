use super::TextureHandle;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Top,
    Mask,
    Hair,
    Bottom,
    Feet,
    HandMain,
    HandOff,
    Accessories,
}

impl EquipSlot {
    pub const COUNT: usize = 8;

    /// Draw order, bottom to top.
    pub const ALL: [EquipSlot; Self::COUNT] = [
        EquipSlot::Top,
        EquipSlot::Mask,
        EquipSlot::Hair,
        EquipSlot::Bottom,
        EquipSlot::Feet,
        EquipSlot::HandMain,
        EquipSlot::HandOff,
        EquipSlot::Accessories,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// A wearable sprite layer. The texture stays owned by the asset registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub texture: TextureHandle,
    pub slot: EquipSlot,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Equipment {
    slots: [Option<TextureHandle>; EquipSlot::COUNT],
    labels: [String; EquipSlot::COUNT],
}

impl Equipment {
    /// Puts `item` in its slot, replacing whatever was there.
    pub fn equip(&mut self, item: &Item) {
        self.slots[item.slot.index()] = Some(item.texture);
        self.labels[item.slot.index()].clone_from(&item.label);
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<TextureHandle> {
        self.labels[slot.index()].clear();
        self.slots[slot.index()].take()
    }

    /// Display name of the item in `slot`, if one is worn.
    pub fn label(&self, slot: EquipSlot) -> Option<&str> {
        self.get(slot).map(|_| self.labels[slot.index()].as_str())
    }

    pub fn is_equipped(&self, slot: EquipSlot) -> bool {
        self.slots[slot.index()].is_some()
    }

    pub fn get(&self, slot: EquipSlot) -> Option<TextureHandle> {
        self.slots[slot.index()]
    }

    /// Occupied slots in draw order.
    pub fn equipped(&self) -> impl Iterator<Item = (EquipSlot, TextureHandle)> + '_ {
        EquipSlot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|tex| (slot, tex)))
    }
}
