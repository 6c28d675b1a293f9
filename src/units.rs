use derive_more::{Add, AddAssign, Display, From, Into, MulAssign, Sum};

/// A value in PDF points (1/72 of an inch). All document geometry is
/// ultimately expressed in points before being written out.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, AddAssign, MulAssign, Sum, From, Into,
    Display,
)]
pub struct Pt(pub f32);

/// A value in millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, From, Into, Display)]
pub struct Mm(pub f32);

/// A value in inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, From, Into, Display)]
pub struct In(pub f32);

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Pt {
        Pt(mm.0 * 72.0 / 25.4)
    }
}

impl From<In> for Pt {
    fn from(inches: In) -> Pt {
        Pt(inches.0 * 72.0)
    }
}

impl From<Pt> for Mm {
    fn from(pt: Pt) -> Mm {
        Mm(pt.0 * 25.4 / 72.0)
    }
}

impl std::ops::Sub for Pt {
    type Output = Pt;
    fn sub(self, rhs: Pt) -> Pt {
        Pt(self.0 - rhs.0)
    }
}

impl std::ops::Mul<f32> for Pt {
    type Output = Pt;
    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl std::ops::Div<f32> for Pt {
    type Output = Pt;
    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

impl std::ops::Div<Pt> for Pt {
    type Output = f32;
    fn div(self, rhs: Pt) -> f32 {
        self.0 / rhs.0
    }
}

impl std::ops::Mul<f32> for Mm {
    type Output = Mm;
    fn mul(self, rhs: f32) -> Mm {
        Mm(self.0 * rhs)
    }
}
