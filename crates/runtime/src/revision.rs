/// Lifecycle revision of a mounted element.
///
/// Mount is revision 0 and every update advances by one. Diagnostics are tagged
/// with the revision that produced them so late async failures can be traced
/// back to the pose that triggered them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision {
    pub index: u64,
}

impl Revision {
    pub const MOUNT: Self = Self { index: 0 };

    pub fn new(index: u64) -> Self {
        Self { index }
    }

    pub fn next(self) -> Self {
        Self::new(self.index.wrapping_add(1))
    }

    pub fn is_mount(self) -> bool {
        self.index == 0
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::Revision;

    #[test]
    fn next_advances_index() {
        let r0 = Revision::MOUNT;
        let r1 = r0.next();
        assert!(r0.is_mount());
        assert!(!r1.is_mount());
        assert_eq!(r1.index, 1);
        assert_eq!(r1.to_string(), "r1");
    }
}
