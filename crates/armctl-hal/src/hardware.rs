//! [`ArmHardware`] – the full set of opened devices the control core drives.
//!
//! Device discovery and opening happen outside the core; whoever owns the
//! hardware hands the core one bundle with every slot filled.  The lifecycle
//! coordinator then splits it so each task owns exactly the devices it needs:
//!
//! | Slot | Owner during steady state |
//! |---|---|
//! | `motors.rotation` / `motors.elevation` | axis controllers |
//! | `motors.claw` | claw controller |
//! | `touch` / `color` | limit monitors |
//! | `buttons` | input dispatcher |
//! | `lights` / `screen` | indicator tasks |

use crate::input::ButtonPad;
use crate::motor::Motor;
use crate::output::{Screen, StatusLights};
use crate::sensor::Sensor;

/// The three actuators of the arm.
pub struct ArmMotors {
    pub rotation: Box<dyn Motor>,
    pub elevation: Box<dyn Motor>,
    pub claw: Box<dyn Motor>,
}

/// Every device the control core uses.
pub struct ArmHardware {
    pub motors: ArmMotors,
    /// Touch switch marking the rotation reference.
    pub touch: Box<dyn Sensor>,
    /// Color sensor watching the elevation reference.
    pub color: Box<dyn Sensor>,
    pub buttons: Box<dyn ButtonPad>,
    pub lights: Box<dyn StatusLights>,
    pub screen: Box<dyn Screen>,
}
