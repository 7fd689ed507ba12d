#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_nrf::interrupt;
use embassy_time::{Duration, Timer};
use embassy_ws2812_dma::nrf::{self, Pwm0Dma};
use embassy_ws2812_dma::{Config, TransferSignal, Ws2812Dma, buffer_len, ws2812_buffer};
use smart_leds::{
    RGB8, SmartLedsWriteAsync as _, brightness,
    hsv::{Hsv, hsv2rgb},
};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

const NUM_LEDS: usize = 8;
const BUFFER_SIZE: usize = buffer_len(NUM_LEDS);
static LED_BUFFER: StaticCell<[u16; BUFFER_SIZE]> = StaticCell::new();
static STRIP_DONE: TransferSignal = TransferSignal::new(nrf::PWM0_ID);

#[interrupt]
fn PWM0() {
    nrf::on_interrupt(&STRIP_DONE);
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());

    let buf = LED_BUFFER.init(ws2812_buffer!(NUM_LEDS));
    let mut config = Config::default();
    config.timing = nrf::TIMING;
    let pwm = Pwm0Dma::new(p.PWM0, p.P0_14);
    let mut ws: Ws2812Dma<_, NUM_LEDS, BUFFER_SIZE> = Ws2812Dma::new(pwm, &STRIP_DONE, buf, config);

    ws.initialize().await.unwrap();
    defmt::info!("Running...");

    let mut hue_offset = 0u8;
    loop {
        let mut colors = [RGB8::default(); NUM_LEDS];

        for (i, color) in colors.iter_mut().enumerate() {
            let hue = hue_offset.wrapping_add((i as u8) * 32);
            let hsv = Hsv {
                hue,
                sat: 255,
                val: 50, // Keep brightness reasonable
            };
            *color = hsv2rgb(hsv);
        }

        ws.write(brightness(colors.into_iter(), 64)).await.unwrap();
        hue_offset = hue_offset.wrapping_add(4);
        Timer::after(Duration::from_millis(25)).await;
    }
}
