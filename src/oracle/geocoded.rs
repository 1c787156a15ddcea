use crate::error::{GeocodeError, OracleError};
use crate::models::{Address, Coordinate, Distance};
use crate::oracle::cache::SingleFlight;
use crate::oracle::{DistanceOracle, TravelMode};
use crate::services::Geocoder;

/// Address-keyed oracle that resolves both ends and delegates to a coordinate oracle
///
/// Every address is geocoded once; later legs reuse the coordinate. A geocoder
/// outage is not remembered, the next leg asks again. An address the geocoder
/// cannot find has no route.
pub struct GeocodedOracle<G, O> {
    geocoder: G,
    inner: O,
    resolved: SingleFlight<Address, Result<Coordinate, GeocodeError>>,
}

impl<G, O> GeocodedOracle<G, O>
where
    G: Geocoder,
    O: DistanceOracle<Location = Coordinate>,
{
    pub fn new(geocoder: G, inner: O) -> Self {
        Self {
            geocoder,
            inner,
            resolved: SingleFlight::new(),
        }
    }

    fn resolve(&self, address: &Address) -> Result<Coordinate, GeocodeError> {
        let resolved = self.resolved.get_or_compute(address.clone(), || {
            let resolved = self.geocoder.geocode(address);
            tracing::trace!("Resolved {} -> {:?}", address, resolved);
            resolved
        });

        if let Err(GeocodeError::Unavailable(_)) = resolved {
            self.resolved.forget(address);
        }
        resolved
    }
}

impl<G, O> DistanceOracle for GeocodedOracle<G, O>
where
    G: Geocoder,
    O: DistanceOracle<Location = Coordinate>,
{
    type Location = Address;

    fn distance(
        &self,
        origin: &Address,
        destination: &Address,
        mode: TravelMode,
    ) -> Result<Distance, OracleError> {
        let from = self.resolve(origin)?;
        let to = self.resolve(destination)?;

        self.inner.distance(&from, &to, mode)
    }
}
