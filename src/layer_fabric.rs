use crate::layer::Layer;
use crate::neuron::Neuron;

/// Fabric used to create network layers, by the builder and by topology mutation.
///
/// `outgoing` is the next layer's neuron count, or `None` for the output layer.
/// All weights are zeroed.
pub fn create_layer(neurons: usize, outgoing: Option<usize>) -> Layer {
    let neurons = (0..neurons)
        .map(|_| match outgoing {
            Some(count) => Neuron::with_zeroed_weights(count),
            None => Neuron::output_neuron(),
        })
        .collect();

    Layer::new(neurons)
}

/// Same neuron count as `layer`, outgoing weights rebuilt (zeroed) to `outgoing`
pub fn adapt_weights(layer: &Layer, outgoing: Option<usize>) -> Layer {
    create_layer(layer.len(), outgoing)
}
