// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions shared by both cars (STM32F767).

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpioc, Alternate},
    pac,
    prelude::*,
};

use super::gpio::{InPin, OutPin};

pub struct BoardPins {
    pub bridge: BridgePins,
    pub sonar: SonarPins,
    pub leds: BlindSpotPins,
    pub usart1: Usart1Pins,
    pub usart6: Usart6Pins,
}

/// L298N inputs. IN1/IN2 steer the left pair, IN3/IN4 the right pair.
pub struct BridgePins {
    pub in1: OutPin<'A', 5>,
    pub in2: OutPin<'A', 4>,
    pub in3: OutPin<'A', 3>,
    pub in4: OutPin<'A', 2>,
    pub ena: gpioa::PA0<Alternate<1>>, // TIM2_CH1
    pub enb: gpioa::PA1<Alternate<1>>, // TIM2_CH2
}

/// HC-SR04 trigger/echo pairs.
pub struct SonarPins {
    pub forward: (OutPin<'B', 0>, InPin<'B', 1>),
    pub left: (OutPin<'B', 2>, InPin<'B', 3>),
    pub right: (OutPin<'B', 4>, InPin<'B', 5>),
    pub backward: (OutPin<'B', 10>, InPin<'B', 11>),
}

pub struct BlindSpotPins {
    pub right: OutPin<'B', 8>,
    pub left: OutPin<'B', 9>,
}

/// Vision co-processor on the main car, telemetry co-processor on the companion.
pub struct Usart1Pins {
    pub tx: gpiob::PB6<Alternate<7>>,
    pub rx: gpiob::PB7<Alternate<7>>,
}

/// Bluetooth remote.
pub struct Usart6Pins {
    pub tx: gpioc::PC6<Alternate<8>>,
    pub rx: gpioc::PC7<Alternate<8>>,
}

impl BoardPins {
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpioc: pac::GPIOC) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpioc = gpioc.split();

        Self {
            bridge: BridgePins {
                in1: OutPin::new(gpioa.pa5),
                in2: OutPin::new(gpioa.pa4),
                in3: OutPin::new(gpioa.pa3),
                in4: OutPin::new(gpioa.pa2),
                ena: gpioa.pa0.into_alternate::<1>(),
                enb: gpioa.pa1.into_alternate::<1>(),
            },

            sonar: SonarPins {
                forward: (OutPin::new(gpiob.pb0), InPin::new(gpiob.pb1)),
                left: (OutPin::new(gpiob.pb2), InPin::new(gpiob.pb3)),
                right: (OutPin::new(gpiob.pb4), InPin::new(gpiob.pb5)),
                backward: (OutPin::new(gpiob.pb10), InPin::new(gpiob.pb11)),
            },

            leds: BlindSpotPins {
                right: OutPin::new(gpiob.pb8),
                left: OutPin::new(gpiob.pb9),
            },

            usart1: Usart1Pins {
                tx: gpiob.pb6.into_alternate::<7>(),
                rx: gpiob.pb7.into_alternate::<7>(),
            },

            usart6: Usart6Pins {
                tx: gpioc.pc6.into_alternate::<8>(),
                rx: gpioc.pc7.into_alternate::<8>(),
            },
        }
    }
}
