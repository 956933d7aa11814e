//! MRMS products served by the Iowa Environmental Mesonet archive.
//!
//! Both products live under `{host}/YYYY/MM/DD/mrms/ncep/<product>/`.

use crate::{error::ConfigError, locator::UrlTemplate};

pub const DEFAULT_HOST: &str = "http://mtarchive.geol.iastate.edu";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    /// Hourly radar-only quantitative precipitation estimate.
    RadarOnlyQpe01H,
    /// Instantaneous precipitation rate, published every two minutes.
    PrecipRate,
}

impl Product {
    pub fn name(&self) -> &'static str {
        match self {
            Product::RadarOnlyQpe01H => "RadarOnly_QPE_01H",
            Product::PrecipRate => "PrecipRate",
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            Product::RadarOnlyQpe01H => {
                "%Y/%m/%d/mrms/ncep/RadarOnly_QPE_01H/RadarOnly_QPE_01H_00.00_%Y%m%d-%H0000.grib2.gz"
            }
            Product::PrecipRate => {
                "%Y/%m/%d/mrms/ncep/PrecipRate/PrecipRate_00.00_%Y%m%d-%H%M00.grib2.gz"
            }
        }
    }

    pub fn template(&self, host: &str) -> Result<UrlTemplate, ConfigError> {
        UrlTemplate::new(host, self.pattern())
    }
}
