use bitflags::bitflags;

bitflags! {
    /// Item classification. Base type bits, weapon/armor kind bits and
    /// weapon properties are combined freely.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ItemFlags: u32 {
        const WEAPON = 1 << 0;
        const ARMOR = 1 << 1;
        const POTION = 1 << 2;
        const QUEST = 1 << 3;
        const BOOK = 1 << 4;
        const JUNK = 1 << 5;

        const DAGGER = 1 << 8;
        const SWORD = 1 << 9;
        const BOW = 1 << 10;
        const CROSSBOW = 1 << 11;
        const STAFF = 1 << 12;
        const WAND = 1 << 13;

        const HELMET = 1 << 16;
        const AMULET = 1 << 17;
        const CHEST = 1 << 18;
        const BELT = 1 << 19;
        const BOOTS = 1 << 20;
        const RING = 1 << 21;
        const LEGS = 1 << 22;
        const ARMS = 1 << 23;

        const TWO_HANDED = 1 << 24;
        const MAIN_HAND_ONLY = 1 << 25;
        const CAN_BACKSTAB = 1 << 26;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemData {
    pub name: String,
    pub description: String,
    pub flags: ItemFlags,
    /// Key into the icon atlas used by the UI.
    pub icon: String,
}

impl ItemData {
    pub fn new(name: impl Into<String>, flags: ItemFlags) -> Self {
        let name = name.into();
        Self {
            icon: name.to_lowercase().replace(' ', "_"),
            name,
            description: String::new(),
            flags,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Quest items stay with the party.
    pub fn can_drop(&self) -> bool {
        !self.flags.contains(ItemFlags::QUEST)
    }
}
