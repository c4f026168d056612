#![forbid(unsafe_code)]

pub use rand_pcg;

pub mod dist;

pub mod device {
    pub mod compress;
    pub mod energy;
    pub mod node;
}

pub mod net {
    pub mod access;
    pub mod channel;
    pub mod fading;
    pub mod irs;
    pub mod mac;
}

pub mod offload {
    pub mod mode;
    pub mod sample;
    pub mod transmitter;
}
