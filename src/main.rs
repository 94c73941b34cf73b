// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Main car firmware.

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_halt as _;

use hal::{
    pac::{self, interrupt},
    prelude::*,
    serial::{self, Serial},
};
use stm32f7xx_hal as hal;

use v2v_overtake::{
    control::{BlindSpotLeds, MainCar},
    drivers::{Hcsr04, L298n},
    hw::{usart, BoardPins, Led, SysTickDelay, Tim2Pwm, Usart},
    log_error, log_info,
    motors::MotorActuator,
    protocol::{CommandMailbox, LinkHandshake},
    sensors::SensorArray,
    Config,
};

/// Latest Bluetooth order, written by the USART6 handler.
static MAILBOX: CommandMailbox = CommandMailbox::new();

#[entry]
fn main() -> ! {
    let cfg = Config::default();

    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(16.MHz()).freeze();
    let delay = SysTickDelay::new(cp.SYST, clocks.sysclk().raw());

    // GPIO
    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC);

    // TIM2 PWM on the H-bridge enables
    // SAFETY: RCC is already frozen; only the TIM2 enable bit is touched.
    let rcc_regs = unsafe { &*pac::RCC::ptr() };
    let (ena, enb) = Tim2Pwm::new(dp.TIM2, rcc_regs, &cfg.drive).split();
    let _pwm_pins = (pins.bridge.ena, pins.bridge.enb);

    let bridge = L298n::new(
        pins.bridge.in1,
        pins.bridge.in2,
        pins.bridge.in3,
        pins.bridge.in4,
        ena,
        enb,
    );
    let mut motors = MotorActuator::new(bridge, cfg.drive.initial_speed);
    motors.init().unwrap();
    motors.start().unwrap();

    // Ultrasonic sensors
    let (ft, fe) = pins.sonar.forward;
    let (lt, le) = pins.sonar.left;
    let (rt, re) = pins.sonar.right;
    let (bt, be) = pins.sonar.backward;
    let sensors = SensorArray::new(
        Hcsr04::new(ft, fe),
        Hcsr04::new(lt, le),
        Hcsr04::new(rt, re),
        Hcsr04::new(bt, be),
        cfg.sensor,
    );

    // USART1 (vision co-processor)
    let vision = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        serial_config(),
    );
    let link = LinkHandshake::new(Usart::new(vision), cfg.link);

    // USART6 (Bluetooth remote), receive interrupt only
    let mut remote = Serial::new(
        dp.USART6,
        (pins.usart6.tx, pins.usart6.rx),
        &clocks,
        serial_config(),
    );
    remote.listen(serial::Event::Rxne);
    unsafe { cortex_m::peripheral::NVIC::unmask(pac::Interrupt::USART6) };

    // Blind-spot LEDs
    let leds = BlindSpotLeds::new(
        Led::active_high(pins.leds.right).unwrap(),
        Led::active_high(pins.leds.left).unwrap(),
    );

    let mut car = MainCar::new(motors, sensors, link, delay, &MAILBOX, leds, &cfg);
    log_info!("main car: ready");

    loop {
        if let Err(e) = car.step() {
            log_error!("main car: {:?}", e);
        }
    }
}

/// 9600 8N1, shared by both ports.
fn serial_config() -> serial::Config {
    serial::Config {
        baud_rate: 9_600.bps(),
        ..Default::default()
    }
}

#[interrupt]
fn USART6() {
    if let Some(byte) = usart::take_rx_byte() {
        MAILBOX.post(byte);
    }
}
